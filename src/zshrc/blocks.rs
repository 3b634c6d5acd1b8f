//! Snippets making up the managed section.
use std::collections::BTreeSet;

use super::Block;
use crate::config::Config;
use crate::config::history::History;

const FZF_KEY_BINDINGS: &str = r#"  if fzf --zsh >/dev/null 2>&1; then
    source <(fzf --zsh)
  elif [ -f /usr/share/doc/fzf/examples/key-bindings.zsh ]; then
    source /usr/share/doc/fzf/examples/key-bindings.zsh
  elif [ -f /usr/share/fzf/shell/key-bindings.zsh ]; then
    source /usr/share/fzf/shell/key-bindings.zsh
  fi"#;

const FZF_LAYOUT: &str = "  export FZF_DEFAULT_OPTS='--height 40% --layout=reverse --border'";

/// Minimal config used when neither `~/.zshrc` nor the framework template exists.
#[must_use]
pub fn fallback_base(framework_dir: &str, theme: &str) -> String {
    format!(
        "export ZSH=\"{framework_dir}\"\n\
         ZSH_THEME=\"{theme}\"\n\
         plugins=(git)\n\
         source $ZSH/oh-my-zsh.sh\n"
    )
}

/// Build the managed section from the tools that ended up installed and the
/// manifest. The result depends on nothing else.
#[must_use]
pub fn managed_blocks(tools: &BTreeSet<String>, config: &Config) -> Vec<Block> {
    let mut blocks = vec![
        Block::new(
            "Local binaries",
            "export PATH=\"$HOME/.local/bin:$PATH\"",
        ),
        Block::new(
            "oh-my-zsh updates",
            format!(
                "zstyle ':omz:update' mode {}\nzstyle ':omz:update' frequency {}",
                config.framework.update_mode, config.framework.update_frequency
            ),
        ),
        Block::new(
            "Modular config",
            "if [ -d \"$HOME/.zshrc.d\" ]; then\n  \
             for _rc in \"$HOME\"/.zshrc.d/*.zsh(N); do\n    \
             source \"$_rc\"\n  \
             done\n  \
             unset _rc\n\
             fi",
        ),
    ];

    if let Some(jump) = &config.jump
        && tools.contains(&jump.binary)
    {
        let bin = &jump.binary;
        blocks.push(Block::new(
            "Directory jumping",
            format!(
                "if command -v {bin} >/dev/null 2>&1; then\n  eval \"$({bin} init zsh)\"\nfi"
            ),
        ));
    }

    blocks.push(Block::new("History", history_body(&config.history)));
    blocks.push(fzf_block(tools.contains("fd") && tools.contains("bat")));

    if tools.contains("ripgrep") {
        blocks.push(Block::new("Search", "alias grep='rg'"));
    }

    blocks.push(Block::new("History filter", history_filter(&config.history)));
    blocks
}

fn history_body(history: &History) -> String {
    format!(
        "HISTFILE=\"$HOME/.zsh_history\"\n\
         HISTSIZE={size}\n\
         SAVEHIST={size}\n\
         setopt EXTENDED_HISTORY HIST_EXPIRE_DUPS_FIRST HIST_IGNORE_DUPS HIST_IGNORE_SPACE HIST_VERIFY SHARE_HISTORY",
        size = history.size
    )
}

fn fzf_block(advanced: bool) -> Block {
    let mut body = String::from("if command -v fzf >/dev/null 2>&1; then\n");
    if advanced {
        body.push_str(
            "  export FZF_DEFAULT_COMMAND='fd --type f --hidden --follow --exclude .git'\n  \
             export FZF_CTRL_T_COMMAND=\"$FZF_DEFAULT_COMMAND\"\n  \
             export FZF_ALT_C_COMMAND='fd --type d --hidden --follow --exclude .git'\n  \
             export FZF_CTRL_T_OPTS=\"--preview 'bat --style=numbers --color=always --line-range :500 {}'\"\n  \
             export FZF_ALT_C_OPTS=\"--preview 'ls -la {}'\"\n",
        );
    }
    body.push_str(FZF_LAYOUT);
    body.push('\n');
    body.push_str(FZF_KEY_BINDINGS);
    body.push_str("\nfi");

    let title = if advanced {
        "fzf (fd + bat preview)"
    } else {
        "fzf"
    };
    Block::new(title, body)
}

/// `zshaddhistory` hook: returning 2 keeps a line in the session but out of
/// `$HISTFILE`.
fn history_filter(history: &History) -> String {
    let mut body = format!(
        "zshaddhistory() {{\n  \
         emulate -L zsh\n  \
         local line=${{1%%$'\\n'}}\n  \
         local cmd=${{line%% *}}\n  \
         (( ${{#line}} < {} )) && return 2\n",
        history.min_length
    );
    if !history.ignore.is_empty() {
        body.push_str(&format!(
            "  case $cmd in\n    {}) return 2 ;;\n  esac\n",
            history.ignore.join("|")
        ));
    }
    body.push_str("  return 0\n}");
    body
}
