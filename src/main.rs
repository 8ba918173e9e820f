//! marketops main entrypoint.

use marketops::run;
use marketops::ui::messages;

fn main() {
    if let Err(e) = run() {
        messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
