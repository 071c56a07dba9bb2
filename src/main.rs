use anyhow::Result;

fn main() -> Result<()> {
    import_path_fixer::run_cli()
}
