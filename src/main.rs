use atest::error::AppResult;

fn main() -> AppResult<()> {
    atest::run()
}
