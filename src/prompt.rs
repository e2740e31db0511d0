use std::io::{self, BufRead, Write};

/// Ask a yes/no question. Only an answer starting with `y` or `Y` confirms.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    writeln!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.chars().next(), Some('y' | 'Y')))
}

/// Block until the user presses Enter (or input is closed).
pub fn wait_for_key<R: BufRead>(input: &mut R) -> io::Result<()> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
