//! Company sponsorship lookup binary.
//! Run with: `cargo run --bin lookup -- "Acme, Inc."`

use std::process::ExitCode;

use sponsorlens::start_lookup;

fn main() -> ExitCode {
    start_lookup::run()
}
