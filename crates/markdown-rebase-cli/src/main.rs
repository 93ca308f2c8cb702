use std::process;

fn main() {
    match markdown_rebase_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-rebase error: {err}");
            process::exit(1);
        }
    }
}
