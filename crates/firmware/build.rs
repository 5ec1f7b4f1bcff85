fn main() {
    // Linker script setup is only meaningful for hardware builds; host
    // test builds have no memory.x.
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs::File;
        use std::io::Write;
        use std::path::PathBuf;

        // Put `memory.x` in the output directory and put that directory on
        // the linker search path.
        let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
        let memory_x = include_bytes!("../../memory.x");

        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(memory_x)
            .unwrap();

        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
