fn main() {
    // ESP-IDF link arguments are only needed for the firmware image; host
    // builds (tests, simulator) skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
