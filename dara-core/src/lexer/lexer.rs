use super::token::{str_to_keyword, Token, TokenKind};
use std::fmt::Display;

pub type Spanned = (u32, Token, u32);

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			input,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	/// Returns the next token; once input is exhausted every call yields `Eof`.
	pub fn next_token(&mut self) -> Spanned {
		self.skip_whitespace();

		let ch = match self.ch {
			Some(ch) => ch,
			None => {
				let position = self.position;
				return (position, Token::eof(), position);
			}
		};

		match ch {
			'/' if self.next_ch == Some('/') => self.lex_line_comment(),
			'/' if self.next_ch == Some('*') => self.lex_block_comment(),
			'=' if self.next_ch == Some('=') => self.eat_two_chars(TokenKind::Equal),
			'!' if self.next_ch == Some('=') => self.eat_two_chars(TokenKind::NotEqual),
			'<' if self.next_ch == Some('=') => self.eat_two_chars(TokenKind::LessThanOrEqual),
			'>' if self.next_ch == Some('=') => self.eat_two_chars(TokenKind::GreaterThanOrEqual),
			'&' if self.next_ch == Some('&') => self.eat_two_chars(TokenKind::And),
			'|' if self.next_ch == Some('|') => self.eat_two_chars(TokenKind::Or),
			':' if self.next_ch == Some('=') => self.eat_two_chars(TokenKind::Declare),
			'=' => self.eat_one_char(TokenKind::Assign),
			'!' => self.eat_one_char(TokenKind::Bang),
			'<' => self.eat_one_char(TokenKind::LessThan),
			'>' => self.eat_one_char(TokenKind::GreaterThan),
			'+' => self.eat_one_char(TokenKind::Plus),
			'-' => self.eat_one_char(TokenKind::Minus),
			'*' => self.eat_one_char(TokenKind::Asterisk),
			'/' => self.eat_one_char(TokenKind::Slash),
			'%' => self.eat_one_char(TokenKind::Percent),
			'(' => self.eat_one_char(TokenKind::LParen),
			')' => self.eat_one_char(TokenKind::RParen),
			'{' => self.eat_one_char(TokenKind::LBrace),
			'}' => self.eat_one_char(TokenKind::RBrace),
			',' => self.eat_one_char(TokenKind::Comma),
			';' => self.eat_one_char(TokenKind::Semicolon),
			'"' | '\'' => self.lex_string(ch),
			'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(),
			'0'..='9' => self.lex_number(),
			c => {
				let start_pos = self.position;
				self.next_char();
				let end_pos = self.position;

				(start_pos, Token::new(TokenKind::Illegal, c.to_string()), end_pos)
			}
		}
	}

	/// Collects tokens up to and including the first `Eof`.
	pub fn scan_tokens(&mut self) -> Vec<Spanned> {
		let mut tokens = vec![];

		loop {
			let spanned = self.next_token();
			let is_eof = spanned.1.kind == TokenKind::Eof;

			tokens.push(spanned);

			if is_eof {
				return tokens;
			}
		}
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				if let Some(ch) = self.next_ch {
					self.next_position += ch.len_utf8() as u32;
				}

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.ch, Some(ch) if ch.is_ascii_whitespace()) {
			self.next_char();
		}
	}

	fn eat_one_char(&mut self, kind: TokenKind) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, Token::fixed(kind), end_pos)
	}

	fn eat_two_chars(&mut self, kind: TokenKind) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		self.next_char();
		let end_pos = self.position;

		(start_pos, Token::fixed(kind), end_pos)
	}

	fn lex_ident(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}
			ident.push(ch);
			self.next_char();
		}

		let end_pos = self.position;

		let kind = str_to_keyword(&ident).unwrap_or(TokenKind::Ident);

		(start_pos, Token::new(kind, ident), end_pos)
	}

	fn lex_number(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut value = String::new();

		self.read_digits(&mut value);

		// a period only belongs to the number when a digit follows it
		if self.ch == Some('.') && matches!(self.next_ch, Some(ch) if ch.is_ascii_digit()) {
			value.push('.');
			self.next_char();
			self.read_digits(&mut value);
		}

		let end_pos = self.position;

		(start_pos, Token::new(TokenKind::Number, value), end_pos)
	}

	fn read_digits(&mut self, value: &mut String) {
		while let Some(ch) = self.ch {
			if !ch.is_ascii_digit() {
				break;
			}
			value.push(ch);
			self.next_char();
		}
	}

	fn lex_string(&mut self, delimiter: char) -> Spanned {
		let start_pos = self.position;
		let mut value = String::new();

		self.next_char(); // opening delimiter

		while let Some(ch) = self.next_char() {
			if ch == delimiter {
				break;
			}
			value.push(ch);
		}

		let end_pos = self.position;

		(start_pos, Token::new(TokenKind::String, value), end_pos)
	}

	fn lex_line_comment(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut body = String::new();

		self.next_char();
		self.next_char();

		while let Some(ch) = self.ch {
			if ch == '\n' {
				break;
			}
			body.push(ch);
			self.next_char();
		}

		let end_pos = self.position;

		(start_pos, Token::new(TokenKind::Comment, body.trim()), end_pos)
	}

	fn lex_block_comment(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut body = String::new();

		self.next_char();
		self.next_char();

		loop {
			match (self.ch, self.next_ch) {
				(Some('*'), Some('/')) => {
					self.next_char();
					self.next_char();
					break;
				},
				(Some(ch), _) => {
					body.push(ch);
					self.next_char();
				},
				(None, _) => break,
			}
		}

		let end_pos = self.position;

		(start_pos, Token::new(TokenKind::Comment, body.trim()), end_pos)
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = Spanned;

	fn next(&mut self) -> Option<Self::Item> {
		Some(self.next_token())
	}
}

/// Lexes `src` into tokens, ending with a single `Eof`.
pub fn lex(src: &str) -> Vec<Token> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)))
		.scan_tokens()
		.into_iter()
		.map(|(_, token, _)| token)
		.collect()
}
