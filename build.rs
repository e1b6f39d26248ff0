fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    if std::env::var("CARGO_FEATURE_NANOEDGE").is_ok() {
        link_nanoedge();
    }
}

/// Link the NanoEdge AI static library (`libneai.a`) exported for this board.
///
/// The library directory is taken from `NEAI_LIB_DIR` when set, otherwise the
/// `nanoedge/` directory next to this manifest.
fn link_nanoedge() {
    use std::path::PathBuf;

    println!("cargo:rerun-if-env-changed=NEAI_LIB_DIR");

    let lib_dir = std::env::var_os("NEAI_LIB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap()).join("nanoedge")
        });

    if !lib_dir.join("libneai.a").exists() {
        println!(
            "cargo:warning=libneai.a not found in {}; the nanoedge feature will fail to link",
            lib_dir.display()
        );
    }

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib=static=neai");
    println!("cargo:rerun-if-changed={}", lib_dir.display());
}
