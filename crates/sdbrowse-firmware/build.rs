use std::env;

fn main() {
    println!("cargo:rerun-if-changed=sdkconfig.defaults");

    if env::var("ESP_IDF_SDKCONFIG_DEFAULTS").is_err() {
        eprintln!("WARNING: ESP_IDF_SDKCONFIG_DEFAULTS not set! Stack size and FAT long names may be wrong.");
        eprintln!("Build with: export ESP_IDF_SDKCONFIG_DEFAULTS=crates/sdbrowse-firmware/sdkconfig.defaults");
    }

    embuild::espidf::sysenv::output();
}
