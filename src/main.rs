fn main() -> std::process::ExitCode {
    roster_forge::run()
}
