use dara_core::{
	environment::prelude::Environment,
	eval::{EvalConfig, Evaluator},
	parser::prelude::parse_program
};

use crate::cli::read_line;

const PROMPT: &str = "→ ";

pub fn start(config: EvalConfig) -> std::io::Result<()> {
	if let Err(err) = ctrlc::set_handler(|| {
		println!();
		std::process::exit(0);
	}) {
		tracing::warn!("could not install Ctrl-C handler: {err}");
	}

	let env = Environment::new_env();
	let mut evaluator = Evaluator::new(config);

	while let Some(input) = read_line(PROMPT)? {
		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let parsed = parse_program(&input);

				if parsed.has_errors() {
					print_parser_errors(&parsed.error_messages());
					continue;
				}

				let evaluated = evaluator.eval_program(&parsed.program, &env);

				println!("{}", evaluated.describe());
			}
		}
	}

	Ok(())
}

fn print_parser_errors(errors: &[String]) {
	println!("  parser errors:");

	for message in errors {
		println!("\t{message}");
	}
}
