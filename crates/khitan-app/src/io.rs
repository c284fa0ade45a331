use std::io::BufRead;
use std::thread;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

/// Forward stdin lines to the event loop until EOF, cancellation or a closed
/// channel. EOF is forwarded as `/quit`.
pub fn stdin_reader(input_tx: AsyncSender<String>, cancel: CancellationToken) {
    let tx = input_tx.to_sync();

    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            if cancel.is_cancelled() {
                break;
            }

            match lines.next() {
                Some(Ok(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    let _ = tx.send("/quit".to_string());
                    break;
                }
                None => {
                    let _ = tx.send("/quit".to_string());
                    break;
                }
            }
        }

        tracing::debug!("Stdin reader stopping");
    });
}
