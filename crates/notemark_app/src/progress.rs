use notemark_engine::{ImportEvent, SessionObserver};
use notemark_logging::notemark_debug;

/// Prints session progress to the terminal, one line per status change.
pub struct ConsoleProgress;

impl SessionObserver for ConsoleProgress {
    fn notify(&self, event: ImportEvent) {
        match event {
            ImportEvent::Status(status) => println!("{status}"),
            ImportEvent::RemainingChanged { text } => {
                notemark_debug!("Pending list now has {} line(s)", text.lines().count());
            }
            ImportEvent::TargetImported { url } => println!("  imported {url}"),
            ImportEvent::TargetFailed { url, reason } => eprintln!("  kept {url}: {reason}"),
            ImportEvent::Finished(summary) => {
                if !summary.remaining_text.is_empty() {
                    println!("Still pending:\n{}", summary.remaining_text);
                }
            }
        }
    }
}
