use clap::{App, Arg, ArgMatches, SubCommand};
use colored::*;
use serde_json::json;
use stk_connect::config::{DEFAULT_HOST, DEFAULT_PORT};
use stk_connect::{ConnectError, ConnectObject, ObjectClass, Session, SessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_port = DEFAULT_PORT.to_string();
    let matches = App::new("stkconnect")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("🛰️  Command-line client for the STK Connect protocol")
        .arg(
            Arg::with_name("host")
                .short("H")
                .long("host")
                .value_name("HOST")
                .help("Connect server host")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Connect server port")
                .takes_value(true)
                .global(true)
                .validator(|v| match v.parse::<u16>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Port must be a number between 0 and 65535".into()),
                }),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON session configuration; --host and --port override it")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["text", "json"])
                .default_value("text")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable verbose output")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("send")
                .about("📤 Send a raw Connect command")
                .arg(Arg::with_name("COMMAND").required(true).multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("report")
                .about("📄 Send a command and print its multi-message report")
                .arg(Arg::with_name("COMMAND").required(true).multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("message")
                .about("📨 Send a command and print its single message response")
                .arg(Arg::with_name("COMMAND").required(true).multiple(true)),
        )
        .subcommand(SubCommand::with_name("units").about("📏 Show the active unit abbreviations"))
        .subcommand(
            SubCommand::with_name("list")
                .about("📋 List loaded objects of a class")
                .arg(Arg::with_name("CLASS").required(true).help("Object class, e.g. Satellite")),
        )
        .subcommand(
            SubCommand::with_name("new")
                .about("✨ Create an object")
                .arg(Arg::with_name("CLASS").required(true).help("Object class, e.g. Facility"))
                .arg(Arg::with_name("NAME").required(true)),
        )
        .subcommand(
            SubCommand::with_name("unload")
                .about("🗑️  Unload an object")
                .arg(Arg::with_name("PATH").required(true).help("Object path, e.g. */Satellite/ERS1")),
        )
        .subcommand(
            SubCommand::with_name("unload-all")
                .about("🧹 Unload every object, including the scenario")
                .arg(
                    Arg::with_name("force")
                        .long("force")
                        .help("Required to confirm unloading everything"),
                ),
        )
        .get_matches();

    tracing_subscriber::fmt::init();

    let mut config = match matches.value_of("config") {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(host) = matches.value_of("host") {
        config.host = host.to_string();
    }
    if let Some(port) = matches.value_of("port") {
        config.port = port.parse()?;
    }

    let format = matches.value_of("format").unwrap_or("text");
    let verbose = matches.is_present("verbose");
    config.record_history = config.record_history || verbose;

    if verbose && format != "json" {
        println!("{}", "🛰️  stkconnect".bright_blue().bold());
        println!("{} {}", "Connecting to".dimmed(), config.address());
    }

    let session = Session::new(config);
    if let Err(e) = session.connect() {
        print_connect_failure(&e, &default_port);
        return Err(e.into());
    }

    let outcome = match matches.subcommand() {
        ("send", Some(sub)) => handle_send(&session, &command_text(sub), format),
        ("report", Some(sub)) => handle_report(&session, &command_text(sub), format),
        ("message", Some(sub)) => handle_message(&session, &command_text(sub), format),
        ("units", Some(_)) => handle_units(&session, format),
        ("list", Some(sub)) => handle_list(&session, sub, format),
        ("new", Some(sub)) => handle_new(&session, sub, format),
        ("unload", Some(sub)) => handle_unload(&session, sub, format),
        ("unload-all", Some(sub)) => handle_unload_all(&session, sub, format),
        _ => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
            println!("{}", "Quick start:".bright_green());
            println!("  {} Start a local mock server", "stk-mock-server".bright_cyan());
            println!("  {} Show unit settings", "stkconnect units".bright_cyan());
            println!("  {} List satellites", "stkconnect list Satellite".bright_cyan());
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        print_error(e, format);
    }
    if verbose {
        print_history(&session, format);
    }

    if session.is_connected() {
        session.close()?;
    }
    outcome.map_err(Into::into)
}

fn command_text(matches: &ArgMatches<'_>) -> String {
    matches
        .values_of("COMMAND")
        .map(|words| words.collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn handle_send(session: &Session, command: &str, format: &str) -> stk_connect::Result<()> {
    session.send(command)?;
    match format {
        "json" => println!("{}", json!({ "command": command, "response": "ACK" })),
        _ => println!("{} {}", "✅".green(), "ACK".bright_green()),
    }
    Ok(())
}

fn handle_report(session: &Session, command: &str, format: &str) -> stk_connect::Result<()> {
    session.send(command)?;
    let lines = session.get_report()?;
    match format {
        "json" => println!("{}", json!({ "command": command, "report": lines })),
        _ => {
            println!("{} {}", "📄".bright_blue(), command.bright_white().bold());
            for line in &lines {
                println!("{}", line.trim_end());
            }
        }
    }
    Ok(())
}

fn handle_message(session: &Session, command: &str, format: &str) -> stk_connect::Result<()> {
    session.send(command)?;
    let message = session.get_single_message()?;
    match format {
        "json" => println!("{}", serde_json::to_string(&message).unwrap_or_default()),
        _ => {
            println!(
                "{} {} ({} bytes)",
                "📨".bright_blue(),
                message.command_name.bright_white(),
                message.data_length
            );
            println!("{}", message.data.trim_end());
        }
    }
    Ok(())
}

fn handle_units(session: &Session, format: &str) -> stk_connect::Result<()> {
    session.update_units()?;
    let units = session.units();
    match format {
        "json" => println!("{}", json!(units)),
        _ => {
            println!("\n{}", "📏 Unit Abbreviations".bright_blue().bold());
            println!("{}", "════════════════════".bright_blue());
            for (dimension, unit) in &units {
                println!("{:<24} {}", dimension.bright_white(), unit.bright_cyan());
            }
        }
    }
    Ok(())
}

fn handle_list(session: &Session, matches: &ArgMatches<'_>, format: &str) -> stk_connect::Result<()> {
    let class: ObjectClass = matches.value_of("CLASS").unwrap_or_default().parse()?;
    let paths = session.show_names(class)?;
    match format {
        "json" => println!("{}", json!({ "class": class.as_str(), "paths": paths })),
        _ => {
            if paths.is_empty() {
                println!("{} No {} objects loaded", "ℹ️".blue(), class.as_str().bright_white());
            }
            for path in &paths {
                println!("{}", path.bright_cyan());
            }
        }
    }
    Ok(())
}

fn handle_new(session: &Session, matches: &ArgMatches<'_>, format: &str) -> stk_connect::Result<()> {
    let class: ObjectClass = matches.value_of("CLASS").unwrap_or_default().parse()?;
    let name = matches.value_of("NAME").unwrap_or_default();

    let path = match class {
        ObjectClass::Scenario => session.new_scenario(name)?.path().to_string(),
        ObjectClass::Satellite => session.new_satellite(name)?.path().to_string(),
        ObjectClass::Missile => session.new_missile(name)?.path().to_string(),
        ObjectClass::LaunchVehicle => session.new_launch_vehicle(name)?.path().to_string(),
        ObjectClass::Facility => session.new_facility(name)?.path().to_string(),
        ObjectClass::Target => session.new_target(name)?.path().to_string(),
        ObjectClass::Place => session.new_place(name)?.path().to_string(),
        ObjectClass::Sensor => {
            return Err(ConnectError::NotSupported {
                operation: "new",
                class: "Sensor (create it under a vehicle or location)",
            })
        }
    };

    match format {
        "json" => println!("{}", json!({ "created": path })),
        _ => println!("{} Created {}", "✅".green(), path.bright_cyan()),
    }
    Ok(())
}

fn handle_unload(session: &Session, matches: &ArgMatches<'_>, format: &str) -> stk_connect::Result<()> {
    let path = matches.value_of("PATH").unwrap_or_default();
    let class = path
        .rsplit('/')
        .nth(1)
        .and_then(|segment| segment.parse::<ObjectClass>().ok())
        .unwrap_or(ObjectClass::Scenario);
    stk_connect::RemoteObject::new(session, class, path).unload()?;

    match format {
        "json" => println!("{}", json!({ "unloaded": path })),
        _ => println!("{} Unloaded {}", "✅".green(), path.bright_cyan()),
    }
    Ok(())
}

fn handle_unload_all(session: &Session, matches: &ArgMatches<'_>, format: &str) -> stk_connect::Result<()> {
    if !matches.is_present("force") {
        println!("{}", "Unloading everything requires --force".yellow());
        return Ok(());
    }

    session.unload_all()?;
    match format {
        "json" => println!("{}", json!({ "unloaded": "*" })),
        _ => println!("{} {}", "✅".green(), "All objects unloaded".bright_green()),
    }
    Ok(())
}

fn print_error(error: &ConnectError, format: &str) {
    match format {
        "json" => println!("{}", json!({ "error": error.to_string() })),
        _ => {
            eprintln!("{} {}", "❌".red(), error.to_string().bright_red());
            if matches!(error, ConnectError::CommandRejected { .. }) {
                eprintln!("{} Check the command syntax and object path", "💡".yellow());
            } else if error.is_fatal() {
                eprintln!("{} The session is out of sync; reconnect before sending more commands", "⚠️".yellow());
            }
        }
    }
}

fn print_history(session: &Session, format: &str) {
    let history = session.history();
    match format {
        "json" => println!("{}", json!({ "history": history })),
        _ => {
            println!("\n{}", "🕘 History".bright_white().bold());
            for entry in &history {
                let response = match entry.response.as_str() {
                    "ACK" => "ACK".bright_green(),
                    other => other.bright_red(),
                };
                println!("{} {}", response, entry.command.dimmed());
            }
        }
    }
}

fn print_connect_failure(error: &ConnectError, default_port: &str) {
    eprintln!("{} {}", "❌".red(), error.to_string().bright_red());
    eprintln!("{} Is STK running with Connect enabled? Start a local stand-in with:", "💡".yellow());
    eprintln!("   {}", format!("stk-mock-server --port {default_port}").bright_cyan());
    eprintln!("   or connect elsewhere with {}", format!("--host {DEFAULT_HOST}").bright_cyan());
}
