use formwork::config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args()?;
    formwork::run(config)?;
    Ok(())
}
