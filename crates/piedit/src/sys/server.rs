use crate::events::AppEvent;
use async_channel::Sender;
use piekit::control::{self, ControlCommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

/// Unknown lines are ignored.
pub fn parse_line(line: &str) -> Option<AppEvent> {
    line.trim().parse::<ControlCommand>().ok().map(AppEvent::from)
}

pub async fn run_server(tx: Sender<AppEvent>) {
    let socket_path = control::socket_path();

    // stale socket from a previous run
    if fs_err::metadata(&socket_path).is_ok() {
        let _ = fs_err::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!(
                "Failed to bind unix socket {}: {}",
                socket_path.display(),
                e
            );
            return;
        }
    };
    log::debug!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_line(&line) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            None => log::warn!("Ignoring unknown command '{}'", line.trim()),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
