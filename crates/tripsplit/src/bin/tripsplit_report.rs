//! tripsplit-report - Show balances, suggested transfers and budget for a trip.

fn main() -> std::process::ExitCode {
    tripsplit::cmd::report::main()
}
