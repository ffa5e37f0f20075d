//! Fixed content injected into every notebook.

use serde_json::{json, Map, Value};

use crate::notebook::Cell;

/// Substring identifying the setup cell; presence means "already processed"
pub const SETUP_MARKER: &str = "Install Rust in Colab";

/// Line added under the title of the intro markdown cell
pub const INTRO_NOTICE: &str = "**Note:** This notebook will install Rust in your Colab environment. Run the setup cell first!\n";

const SETUP_SOURCE: &[&str] = &[
    "%%bash\n",
    "# Install Rust in Colab (run this cell first!)\n",
    "curl --proto '=https' --tlsv1.2 -sSf https://sh.rustup.rs | sh -s -- -y\n",
    "source $HOME/.cargo/env\n",
    "rustc --version",
];

/// The bootstrap cell: installs rustup and prints the compiler version
pub fn setup_cell() -> Cell {
    Cell::code(SETUP_SOURCE.iter().map(|line| line.to_string()).collect())
}

/// Kernel descriptor for the hosted Python 3 runtime
pub fn metadata_descriptor() -> Map<String, Value> {
    let descriptor = json!({
        "kernelspec": {
            "display_name": "Python 3",
            "language": "python",
            "name": "python3"
        },
        "language_info": {
            "codemirror_mode": {
                "name": "ipython",
                "version": 3
            },
            "file_extension": ".py",
            "mimetype": "text/x-python",
            "name": "python",
            "nbconvert_exporter": "python",
            "pygments_lexer": "ipython3",
            "version": "3.7.12"
        }
    });

    match descriptor {
        Value::Object(map) => map,
        _ => unreachable!("descriptor literal is an object"),
    }
}
