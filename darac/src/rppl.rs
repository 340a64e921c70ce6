use dara_core::parser::prelude::parse_program;

use crate::cli::read_line;

const PROMPT: &str = "→ ";

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let parsed = parse_program(&input);

				if parsed.has_errors() {
					for err in &parsed.errors {
						let (message, messages) = err.details();

						println!("[at {}] Parse error: {err}. {message}.\n\t{}", err.span, messages.join(";\n\t"));
					}
				} else {
					println!("{}", parsed.program);
				}
			}
		}
	}

	Ok(())
}
