fn main() {
    stanza_probe::cli::run();
}
