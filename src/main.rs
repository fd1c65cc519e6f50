fn main() {
    shotcall_lib::run()
}
