/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::env;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use jabberwire::Connection;
use jabberwire::ConnectionError;
use jabberwire::IqStanza;
use jabberwire::Jid;
use tracing_subscriber::EnvFilter;

fn print_version() {
    println!("jabwire (jabberwire) v{}", jabberwire::VERSION);
}

fn print_usage() {
    println!(concat!(
        "Usage: jabwire [OPTIONS]\n",
        "This tool talks to an XMPP server interactively.\n",
        "Options:\n",
        "  -H, --host <HOST>      Server to connect to\n",
        "  -p, --port <PORT>      Server port (default 5222)\n",
        "  -d, --domain <DOMAIN>  Domain of the stream (default is the host)\n",
        "  -u, --user <USER>      User name for authenticate and register\n",
        "  -r, --recipient <JID>  Recipient of chat messages\n",
        "  -t, --timeout <MS>     Request timeout in milliseconds\n",
        "      --debug            Log all traffic\n",
        "  -h, --help             Display this help message and exit\n",
        "  -v, --version          Display the version and exit\n",
        "Commands:\n",
        "  connect, authenticate, register, message <TEXT>, presence, roster,\n",
        "  disconnect, quit"
    ));
}

#[derive(Default)]
struct Options {
    host: Option<String>,
    port: Option<u16>,
    domain: Option<String>,
    user: Option<String>,
    recipient: Option<Jid>,
    timeout: Option<Duration>,
    debug: bool,
}

enum Parsed {
    Run(Options),
    Exit(ExitCode),
}

fn parse_args() -> Parsed {
    let mut args = env::args();
    let mut options = Options::default();

    // Skip the first argument (program name)
    args.next();
    while let Some(arg) = args.next() {
        if arg == "--debug" {
            options.debug = true;
            continue;
        }
        if arg == "-h" || arg == "--help" {
            print_usage();
            return Parsed::Exit(ExitCode::SUCCESS);
        }
        if arg == "-v" || arg == "--version" {
            print_version();
            return Parsed::Exit(ExitCode::SUCCESS);
        }
        let Some(value) = args.next() else {
            eprintln!("Error: value expected after {arg}");
            return Parsed::Exit(ExitCode::FAILURE);
        };
        let result = match arg.as_str() {
            "-H" | "--host" => {
                options.host = Some(value);
                Ok(())
            }
            "-p" | "--port" => value
                .parse()
                .map(|port| options.port = Some(port))
                .map_err(|err| format!("bad port: {err}")),
            "-d" | "--domain" => {
                options.domain = Some(value);
                Ok(())
            }
            "-u" | "--user" => {
                options.user = Some(value);
                Ok(())
            }
            "-r" | "--recipient" => Jid::new(&value)
                .map(|jid| options.recipient = Some(jid))
                .map_err(|err| err.to_string()),
            "-t" | "--timeout" => value
                .parse()
                .map(|ms| options.timeout = Some(Duration::from_millis(ms)))
                .map_err(|err| format!("bad timeout: {err}")),
            _ => Err(format!("unknown option {arg}")),
        };
        if let Err(err) = result {
            eprintln!("Error: {err}");
            return Parsed::Exit(ExitCode::FAILURE);
        }
    }

    Parsed::Run(options)
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns `None` at the end of input.
fn read_line(question: &str) -> io::Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt(question: &str) -> io::Result<String> {
    read_line(question)?.ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
}

fn build_connection(options: &Options) -> io::Result<Connection> {
    let host = match &options.host {
        Some(host) => host.clone(),
        None => prompt("Host: ")?,
    };
    let mut builder = Connection::build(&host).request_timeout(options.timeout);
    if let Some(port) = options.port {
        builder = builder.port(port);
    }
    if let Some(domain) = &options.domain {
        builder = builder.domain(domain);
    }
    let connection = builder.build();

    connection.on_element(|element| {
        println!("<<< {element}");
        Ok(())
    });
    connection.on_stream_error(|error| {
        eprintln!("Stream error: {:?} {}", error.condition, error.text.as_deref().unwrap_or(""));
        Ok(())
    });
    connection.on_stream_end(|_| {
        eprintln!("Server closed the stream");
        Ok(())
    });
    connection.on_exception(|err| eprintln!("Observer failed: {err}"));
    connection.on_internal_error(|err| {
        eprintln!("Connection error: {err}");
        Ok(())
    });

    Ok(connection)
}

fn credentials(options: &Options) -> io::Result<(String, String)> {
    let user = match &options.user {
        Some(user) => user.clone(),
        None => prompt("User: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    Ok((user, password))
}

fn show_response(response: Option<IqStanza>) {
    match response {
        Some(iq) => match iq.error {
            Some(error) => println!("Failed: {:?} ({:?})", error.condition, error.kind),
            None => println!("Done"),
        },
        None => println!("No response"),
    }
}

enum CommandError {
    Io(io::Error),
    Connection(ConnectionError),
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Io(err)
    }
}

impl From<ConnectionError> for CommandError {
    fn from(err: ConnectionError) -> Self {
        CommandError::Connection(err)
    }
}

fn run_command(
    connection: &Connection,
    options: &mut Options,
    line: &str,
) -> Result<bool, CommandError> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => {}
        "connect" => connection.connect()?,
        "disconnect" => connection.disconnect()?,
        "authenticate" => {
            let (user, password) = credentials(options)?;
            show_response(connection.authenticate(&user, &password, None, options.timeout)?);
        }
        "register" => {
            let (user, password) = credentials(options)?;
            show_response(connection.register(&user, &password, options.timeout)?);
        }
        "roster" => show_response(connection.roster(options.timeout)?),
        "presence" => connection.presence()?,
        "message" => {
            let recipient = match &options.recipient {
                Some(recipient) => recipient.clone(),
                None => loop {
                    match Jid::new(&prompt("Recipient: ")?) {
                        Ok(jid) => break jid,
                        Err(err) => eprintln!("Error: {err}"),
                    }
                },
            };
            connection.message(rest.trim(), &recipient)?;
            options.recipient = Some(recipient);
        }
        "help" => print_usage(),
        "quit" => return Ok(false),
        _ => eprintln!("Unknown command: {command}"),
    }
    Ok(true)
}

fn main() -> ExitCode {
    let mut options = match parse_args() {
        Parsed::Run(options) => options,
        Parsed::Exit(code) => return code,
    };
    init_logging(options.debug);

    let connection = match build_connection(&options) {
        Ok(connection) => connection,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    loop {
        let line = match read_line("> ") {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        };
        match run_command(&connection, &mut options, &line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(CommandError::Io(err)) => eprintln!("Error: {err}"),
            Err(CommandError::Connection(err)) => eprintln!("Error: {err}"),
        }
    }

    if let Err(err) = connection.disconnect() {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
