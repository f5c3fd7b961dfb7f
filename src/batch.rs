//! Line-oriented front-end for scripted runs
//!
//! Reads one command per line, writes the plain-text reply. An overwrite
//! confirmation consumes the following line as the answer (`c`/`C` accepts).

use crate::commands::{text, Reply, Session};
use crate::constants::PROGRAM_NAME;
use std::io::{self, BufRead, Write};

pub fn run_batch<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(
        output,
        "Welcome to {}! Simulated memory has {} bytes.",
        PROGRAM_NAME,
        session.memory.size()
    )?;

    let mut lines = input.lines();
    while let Some(line) = lines.next() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(output, ">>> {}", line.trim())?;

        match session.execute(&line) {
            Ok(Reply::ConfirmOverwrite { name }) => {
                write_lines(output, &text::render_reply(&Reply::ConfirmOverwrite {
                    name: name.clone(),
                }))?;
                writeln!(output, "Enter c to continue or anything else to cancel")?;
                let answer = match lines.next() {
                    Some(answer) => answer?,
                    None => String::new(),
                };
                if answer.trim().eq_ignore_ascii_case("c") {
                    match session.confirm_overwrite(&name) {
                        Ok(reply) => write_lines(output, &text::render_reply(&reply))?,
                        Err(err) => writeln!(output, "{}", text::render_error(&err))?,
                    }
                } else {
                    writeln!(output, "Keeping previous pointer.")?;
                }
            }
            Ok(Reply::Exit) => {
                write_lines(output, &text::render_reply(&Reply::Exit))?;
                break;
            }
            Ok(reply) => write_lines(output, &text::render_reply(&reply))?,
            Err(err) => writeln!(output, "{}", text::render_error(&err))?,
        }
    }

    output.flush()
}

fn write_lines<W: Write>(output: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(output, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Session, String) {
        let mut session = Session::new(16).unwrap();
        let mut out = Vec::new();
        run_batch(&mut session, script.as_bytes(), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_script_allocates() {
        let (session, out) = run("new_pointer p\nmalloc 4 p\nset_val 9 p\n");
        assert!(out.contains("[SUCCESS] Allocated 4 bytes for pointer p successfully."));
        assert_eq!(session.memory.arena().bytes()[3], 9);
    }

    #[test]
    fn test_errors_do_not_stop_the_run() {
        let (_, out) = run("malloc 4 ghost\nbogus\nhelp\n");
        assert_eq!(out.matches("[ERROR]").count(), 2);
        assert!(out.contains("Command Name : malloc"));
    }

    #[test]
    fn test_overwrite_confirmation() {
        let (session, out) = run("new_pointer p\nmalloc 4 p\nnew_pointer p\nc\n");
        assert!(out.contains("[WARNING]"));
        assert!(!session.memory.pointers().get("p").unwrap().is_bound());

        let (session, out) = run("new_pointer p\nmalloc 4 p\nnew_pointer p\nn\n");
        assert!(out.contains("Keeping previous pointer."));
        assert!(session.memory.pointers().get("p").unwrap().is_bound());
    }

    #[test]
    fn test_exit_stops_reading() {
        let (session, out) = run("exit\nnew_pointer p\n");
        assert!(out.contains("Exiting"));
        assert!(session.memory.pointers().is_empty());
    }
}
