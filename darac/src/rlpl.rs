use dara_core::lexer::prelude::{Lexer, TokenKind};

use crate::cli::read_line;

const PROMPT: &str = "→ ";

pub fn start() -> std::io::Result<()> {
	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let mut lexer = Lexer::new(input.char_indices().map(|(i, c)| (i as u32, c)));

				loop {
					let (start, token, end) = lexer.next_token();

					if token.kind == TokenKind::Eof {
						break;
					}

					println!("{start}..{end}\t{token}");
				}
			}
		}
	}

	Ok(())
}
