fn main() {
    ecoprompt::run();
}
