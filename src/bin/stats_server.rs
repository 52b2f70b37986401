use raster_statistics::service::dispatch::Dispatch;
use raster_statistics::service::{dispatch, error_codes, Request, Response, ServerState};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Work items for the main loop: incoming lines and finished jobs
enum Event {
    Line(String),
    Finished(Response),
    InputClosed,
}

fn init_logging() {
    // stdout carries protocol traffic, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn spawn_reader(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(Event::Line(l)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}

fn write_response(out: &mut impl Write, response: &Response) -> io::Result<()> {
    let json = serde_json::to_string(response).map_err(io::Error::from)?;
    writeln!(out, "{}", json)?;
    out.flush()
}

fn main() {
    init_logging();
    info!("Starting raster statistics server...");

    let mut state = ServerState::new();
    let mut stdout = io::stdout();

    let (tx, rx) = mpsc::channel::<Event>();
    spawn_reader(tx.clone());

    let mut running_jobs = 0usize;
    let mut input_closed = false;

    for event in rx.iter() {
        let response = match event {
            Event::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                match serde_json::from_str::<Request>(&line) {
                    Ok(request) => match dispatch(&mut state, request) {
                        Dispatch::Respond(response) => response,
                        Dispatch::Run(job) => {
                            running_jobs += 1;
                            let tx = tx.clone();
                            thread::spawn(move || {
                                let _ = tx.send(Event::Finished(job.run()));
                            });
                            continue;
                        }
                    },
                    Err(e) => {
                        warn!("Failed to parse request: {}", e);
                        Response::error(None, error_codes::PARSE_ERROR, e.to_string())
                    }
                }
            }
            Event::Finished(response) => {
                running_jobs -= 1;
                response
            }
            Event::InputClosed => {
                input_closed = true;
                if running_jobs == 0 {
                    break;
                }
                continue;
            }
        };

        if let Err(e) = write_response(&mut stdout, &response) {
            error!("Failed to write response: {}", e);
            break;
        }

        if input_closed && running_jobs == 0 {
            break;
        }
    }

    info!("Shutting down...");
}
