fn main() -> anyhow::Result<()> {
    scrollscape::run()
}
