#[derive(Debug, Clone)]
pub struct Opts {
    /// Wrap the single-statement bodies of `if`, `for`, `while` and `do` in
    /// blocks. When disabled, passes still walk the tree but queue no edits.
    pub add_brackets: bool,
}

impl Opts {
    pub fn new() -> Opts {
        Opts { add_brackets: true }
    }
}

impl Default for Opts {
    fn default() -> Opts {
        Opts::new()
    }
}
