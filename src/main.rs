//! glucolog main entrypoint.

use glucolog::run;
use glucolog::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
