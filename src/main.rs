fn main() -> std::process::ExitCode {
  run_strength_planner_lib::run()
}
