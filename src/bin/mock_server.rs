use clap::{App, Arg};
use std::sync::Arc;
use stk_connect::session::{encode_frame, encode_multi_frame};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

const DEFAULT_BIND: &str = "127.0.0.1";

const UNITS: &str = "DateFormat UTCG;\nDistance Meters;\nTime Seconds;\nAngle Degrees;\n\
                     Mass Kilograms;\nPower dBW;\nFrequency Gigahertz;\nLatitude Degrees;\n\
                     Longitude Degrees;\nTemperature Kelvin";

/// Commands that only need their target object to exist.
const OBJECT_COMMANDS: [&str; 5] = [
    "SetState",
    "SetPosition",
    "SetHeightAboveGround",
    "SetConstraint",
    "Define",
];

/// Commands accepted without any checks.
const SCENARIO_COMMANDS: [&str; 5] = ["SetAnalysisTimePeriod", "SetEpoch", "SetUnits", "Animate", "VO"];

#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Ack,
    Nack,
    /// ACK followed by framed response bytes.
    Data(Vec<u8>),
}

/// Loaded objects, keyed by their fully resolved path.
#[derive(Debug, Default)]
struct Registry {
    scenario: Option<String>,
    objects: Vec<String>,
}

impl Registry {
    fn resolve(&self, path: &str) -> Option<String> {
        match (path.strip_prefix("*/"), &self.scenario) {
            (Some(rest), Some(scenario)) => Some(format!("{scenario}/{rest}")),
            (Some(_), None) => None,
            (None, _) => Some(path.to_string()),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.scenario.as_deref() == Some(path) || self.objects.iter().any(|object| object == path)
    }

    fn handle(&mut self, line: &str) -> Reply {
        let tokens = tokenize(line);
        let Some(keyword) = tokens.first() else {
            return Reply::Nack;
        };
        let args = &tokens[1..];

        match keyword.to_ascii_lowercase().as_str() {
            "new" => self.create(args),
            "unload" => self.unload(args),
            "rename" => self.rename(args),
            "shownames" => self.show_names(args),
            "units_get" => data(encode_frame("Units_Get", UNITS)),
            "report" | "report_rm" => self.report(keyword, args),
            _ if is_one_of(keyword, &OBJECT_COMMANDS) => match args.first() {
                Some(path) if self.resolve(path).is_some_and(|p| self.exists(&p)) => Reply::Ack,
                _ => Reply::Nack,
            },
            _ if is_one_of(keyword, &SCENARIO_COMMANDS) => Reply::Ack,
            _ => Reply::Nack,
        }
    }

    /// `New / Scenario <name>` or `New / <parent>/<Class> <name>`
    fn create(&mut self, args: &[String]) -> Reply {
        let [slash, class_path, name] = args else {
            return Reply::Nack;
        };
        if slash != "/" {
            return Reply::Nack;
        }

        if class_path.eq_ignore_ascii_case("Scenario") {
            if self.scenario.is_some() {
                return Reply::Nack;
            }
            self.scenario = Some(format!("/Scenario/{name}"));
            return Reply::Ack;
        }

        let Some(class_path) = self.resolve(class_path) else {
            return Reply::Nack;
        };
        let parent = class_path.rsplit_once('/').map_or("", |(parent, _)| parent);
        let path = format!("{class_path}/{name}");
        if !self.exists(parent) || self.exists(&path) {
            return Reply::Nack;
        }

        self.objects.push(path);
        Reply::Ack
    }

    /// `Unload / <path>`; `*` or the scenario path unloads everything.
    fn unload(&mut self, args: &[String]) -> Reply {
        let [slash, path] = args else {
            return Reply::Nack;
        };
        if slash != "/" {
            return Reply::Nack;
        }

        if path == "*" || self.scenario.as_deref() == Some(path.as_str()) {
            self.scenario = None;
            self.objects.clear();
            return Reply::Ack;
        }

        match self.resolve(path) {
            Some(path) if self.exists(&path) => {
                let children = format!("{path}/");
                self.objects
                    .retain(|object| object != &path && !object.starts_with(&children));
                Reply::Ack
            }
            _ => Reply::Nack,
        }
    }

    /// `Rename <path> <new_name>`, carrying children along.
    fn rename(&mut self, args: &[String]) -> Reply {
        let [path, new_name] = args else {
            return Reply::Nack;
        };
        let Some(old) = self.resolve(path).filter(|path| self.exists(path)) else {
            return Reply::Nack;
        };

        let parent = old.rsplit_once('/').map_or("", |(parent, _)| parent);
        let new = format!("{parent}/{new_name}");
        if self.exists(&new) {
            return Reply::Nack;
        }

        let rebase = |object: &str| -> Option<String> {
            if object == old {
                Some(new.clone())
            } else {
                object
                    .strip_prefix(&format!("{old}/"))
                    .map(|rest| format!("{new}/{rest}"))
            }
        };
        if let Some(scenario) = self.scenario.as_deref().and_then(rebase) {
            self.scenario = Some(scenario);
        }
        for object in &mut self.objects {
            if let Some(renamed) = rebase(object.as_str()) {
                *object = renamed;
            }
        }
        Reply::Ack
    }

    /// `ShowNames * Class <Class>`
    fn show_names(&self, args: &[String]) -> Reply {
        let class = match args {
            [_, keyword, class] if keyword.eq_ignore_ascii_case("Class") => class,
            _ => return Reply::Nack,
        };

        let paths: Vec<&str> = if class.eq_ignore_ascii_case("Scenario") {
            self.scenario.iter().map(String::as_str).collect()
        } else {
            self.objects
                .iter()
                .filter(|object| {
                    object
                        .rsplit('/')
                        .nth(1)
                        .is_some_and(|segment| segment.eq_ignore_ascii_case(class))
                })
                .map(String::as_str)
                .collect()
        };
        data(encode_frame("ShowNames", &paths.join(" ")))
    }

    fn report(&self, keyword: &str, args: &[String]) -> Reply {
        let Some(target) = args.first().and_then(|path| self.resolve(path)) else {
            return Reply::Nack;
        };
        if !self.exists(&target) {
            return Reply::Nack;
        }

        let header = format!("Report for {target}");
        let style = args.get(2).map_or("Default", String::as_str);
        let body = format!("Style: {style}\nTime (UTCG), Value\n01 Nov 2000 00:00:00.000, 0.0\n");
        data(encode_multi_frame(keyword, &[header.as_str(), body.as_str()]))
    }
}

fn data(frame: stk_connect::Result<Vec<u8>>) -> Reply {
    match frame {
        Ok(bytes) => Reply::Data(bytes),
        Err(e) => {
            error!("Failed to frame response: {}", e);
            Reply::Nack
        }
    }
}

fn is_one_of(keyword: &str, table: &[&str]) -> bool {
    table.iter().any(|entry| entry.eq_ignore_ascii_case(keyword))
}

/// Split a command line on whitespace, keeping double-quoted text together.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.trim().chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("stk-mock-server")
        .version("0.1.0")
        .author("Space Systems Engineering Team")
        .about("🧪 Local stand-in for an STK Connect server")
        .arg(
            Arg::with_name("bind")
                .short("b")
                .long("bind")
                .value_name("ADDRESS")
                .help("Address to listen on")
                .takes_value(true)
                .default_value(DEFAULT_BIND),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .takes_value(true),
        )
        .get_matches();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let bind = matches.value_of("bind").unwrap_or(DEFAULT_BIND);
    let port = match matches.value_of("port") {
        Some(port) => port.parse::<u16>()?,
        None => stk_connect::config::DEFAULT_PORT,
    };

    println!("🧪 Mock STK Connect Server");
    println!("==========================");

    let registry = Arc::new(Mutex::new(Registry::default()));
    let listener = TcpListener::bind(format!("{bind}:{port}")).await?;
    info!("🌐 Listening on {}:{}", bind, port);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("🔗 New client connected: {}", addr);
                let client_registry = Arc::clone(&registry);

                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, client_registry).await {
                        warn!("Client {} error: {}", addr, e);
                    }
                    info!("🔌 Client {} disconnected", addr);
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(
    stream: TcpStream,
    registry: Arc<Mutex<Registry>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (reader, mut writer) = stream.into_split();
    let mut buf_reader = BufReader::new(reader);

    let mut line = String::new();
    loop {
        line.clear();
        if buf_reader.read_line(&mut line).await? == 0 {
            break;
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        let reply = registry.lock().await.handle(command);
        match reply {
            Reply::Ack => {
                info!("📨 {}", command);
                writer.write_all(b"ACK").await?;
            }
            Reply::Nack => {
                warn!("❌ NACK {}", command);
                writer.write_all(b"NACK").await?;
            }
            Reply::Data(bytes) => {
                info!("📨 {} ({} response bytes)", command, bytes.len());
                writer.write_all(b"ACK").await?;
                writer.write_all(&bytes).await?;
            }
        }
        writer.flush().await?;
    }

    Ok(())
}
