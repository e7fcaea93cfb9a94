use anyhow::Result;

fn main() -> Result<()> {
    rules_cli::main_entry()
}
