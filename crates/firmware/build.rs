//! Linker setup for the STM32H743ZI target.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "hardware")]
    {
        use std::path::PathBuf;

        // Ship `memory.x` next to the build output and put it on the search path.
        let out = PathBuf::from(std::env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?);
        std::fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))?;
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");

        // Only the firmware binary links for the target; host tests never get here.
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
