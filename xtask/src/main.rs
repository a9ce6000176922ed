// `cargo xtask ci`, `cargo xtask coverage`, etc.
fn main() -> anyhow::Result<()> {
    xtaskops::tasks::main()
}
