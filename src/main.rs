fn main() -> anyhow::Result<()> {
    frametamer::run()?;
    Ok(())
}
