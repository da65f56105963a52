//! tripsplit-check - Validate a trip snapshot.

fn main() -> std::process::ExitCode {
    tripsplit::cmd::check::main()
}
