use std::process;

fn main() {
    match punic_site_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("punic-site error: {err:#}");
            process::exit(punic_site_cli::exit_code_for(&err) as i32);
        }
    }
}
