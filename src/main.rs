fn main() {
    helper_scripts::run_cli();
}
