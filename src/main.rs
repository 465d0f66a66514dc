fn main() {
    holdshot_lib::run()
}
