//! rAttendance main entrypoint.

use rattendance::run;
use rattendance::ui::messages::failure;

fn main() {
    if let Err(e) = run() {
        failure(&e);
        std::process::exit(e.exit_code());
    }
}
