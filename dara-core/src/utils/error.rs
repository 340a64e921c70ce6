use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::parser::prelude::{ParseError, ParseErrorType};
use super::{
    diagnostic::{Diagnostic, Label, Location},
    src_span::SrcSpan,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        errors: Vec<ParseError>
    },
    #[error("evaluation failed: {message}")]
    Runtime {
        path: PathBuf,
        message: String
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, errors } => {
                errors.iter()
                    .map(|error| {
                        let (label, extra) = error.details();

                        // point at the end of input rather than an empty span at 0
                        let span = if matches!(
                            error.error,
                            ParseErrorType::UnexpectedToken { got: crate::lexer::prelude::TokenKind::Eof, .. }
                        ) {
                            SrcSpan::from(src.len() as u32, src.len() as u32)
                        } else {
                            error.span
                        };

                        Diagnostic {
                            title: "Syntax error".into(),
                            text: extra.join("\n"),
                            location: Some(Location {
                                src,
                                path: path.clone(),
                                label: Label {
                                    text: Some(label),
                                    span,
                                },
                            }),
                        }
                    })
                    .collect()
            },
            Error::Runtime { path, message } => vec![Diagnostic {
                title: "Runtime error".into(),
                text: format!("{message}\n  in {}", path.display()),
                location: None,
            }],
            Error::StdIo { err } => vec![Diagnostic {
                title: "IO error".into(),
                text: format!("{err}"),
                location: None,
            }],
        }
    }
}
