fn main() {
    if let Err(err) = gig_board_lib::run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
