use std::path::PathBuf;
use std::{env, fs};

// nRF5340 application core, no bootloader
const FLASH_ORIGIN: u32 = 0x0000_0000;
const FLASH_LENGTH: u32 = 1024 * 1024;
const RAM_ORIGIN: u32 = 0x2000_0000;
const RAM_LENGTH: u32 = 512 * 1024;

fn main() {
    let memory_x = format!(
        "\
MEMORY
{{
  FLASH : ORIGIN = {:#010x}, LENGTH = {:#08x}
  RAM   : ORIGIN = {:#010x}, LENGTH = {:#08x}
}}
",
        FLASH_ORIGIN, FLASH_LENGTH, RAM_ORIGIN, RAM_LENGTH,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("memory.x"), memory_x).expect("write memory.x");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rustc-link-arg-bins=--print-memory-usage");
}
