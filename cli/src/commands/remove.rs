use super::Context;
use anyhow::{bail, Context as _, Result};
use clap::Args;
use crossterm_style::{style, Color};

#[derive(Debug, Args)]
pub struct RemoveCommand {
  #[clap(help = "Label of the account to remove")]
  pub label: String,
}

impl RemoveCommand {
  pub fn run(self, context: &Context) -> Result<()> {
    let mut store = context.open_store()?;

    if !store.remove(&self.label) {
      bail!("Account not found: {}", self.label);
    }
    store.save().with_context(|| "Saving accounts")?;
    println!("{} {}", style("Removed:").with(Color::Green), self.label);

    Ok(())
  }
}
