use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn generate_completions(shell: Shell) {
    let mut cmd = crate::Cli::command();
    generate(shell, &mut cmd, "repofav", &mut io::stdout());

    eprintln!();
    eprintln!("Save the output to the appropriate location for your shell:");
    match shell {
        Shell::Bash => {
            eprintln!("  repofav completions bash > ~/.local/share/bash-completion/completions/repofav");
        }
        Shell::Zsh => {
            eprintln!("  repofav completions zsh > ~/.zsh/completions/_repofav");
            eprintln!("  # (Add 'fpath=(~/.zsh/completions $fpath)' before 'compinit' in .zshrc)");
        }
        Shell::Fish => {
            eprintln!("  repofav completions fish > ~/.config/fish/completions/repofav.fish");
        }
        _ => {}
    }
}
