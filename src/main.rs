fn main() -> anyhow::Result<()> {
    lj::run()
}
