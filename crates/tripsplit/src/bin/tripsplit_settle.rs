//! tripsplit-settle - Record a settlement transfer in a trip snapshot.

fn main() -> std::process::ExitCode {
    tripsplit::cmd::settle::main()
}
