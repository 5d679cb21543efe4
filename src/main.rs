//! gl-xref CLI
//!
//! Cross-reference symbols in a Khronos-style API registry XML file.
//!
//! # Usage
//!
//! ```bash
//! # Full report: definition, extension, feature history, aliases
//! gl-xref describe glBindBuffer
//!
//! # Individual queries
//! gl-xref lookup GL_ARRAY_BUFFER
//! gl-xref aliases glActiveTexture
//! gl-xref origin GL_CURRENT_BIT
//! gl-xref extension glBindBufferARB
//!
//! # Group queries
//! gl-xref groups
//! gl-xref groups --of GL_CURRENT_BIT
//! gl-xref groups --matching Buffer
//!
//! # List every feature set in the registry
//! gl-xref features
//!
//! # Query a registry other than ./gl.xml
//! gl-xref -r /path/to/gl.xml describe glFlush
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process;

use gl_xref::{Registry, Symbol, XrefError};

#[derive(Parser)]
#[command(name = "gl-xref")]
#[command(about = "Symbol cross-reference for Khronos-style API registries")]
#[command(version)]
struct Cli {
    /// Registry XML file to query
    #[arg(short, long, global = true, default_value = "gl.xml")]
    registry: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report for a symbol: definition, extension, feature history, aliases
    Describe {
        /// Symbol name (command or enum constant), case-insensitive
        symbol: String,
    },
    /// Locate a symbol's defining entry
    Lookup {
        /// Symbol name, case-insensitive
        symbol: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every other name for a symbol
    Aliases {
        /// Symbol name, case-insensitive
        symbol: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report which feature sets require, deprecate, or remove a symbol
    Origin {
        /// Symbol name, case-insensitive
        symbol: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report the first extension providing a symbol
    Extension {
        /// Symbol name, case-insensitive
        symbol: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Query enum groups
    Groups {
        /// List the groups of one constant
        #[arg(long, conflicts_with = "matching")]
        of: Option<String>,
        /// List constants whose groups contain this fragment
        #[arg(long)]
        matching: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every feature set declared in the registry
    Features {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let text = match fs::read_to_string(&cli.registry) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Cannot open '{}': {}", cli.registry.display(), e);
            process::exit(2);
        }
    };
    let doc = match roxmltree::Document::parse(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!(
                "Cannot parse '{}': {}",
                cli.registry.display(),
                XrefError::Parse(e.to_string())
            );
            process::exit(2);
        }
    };
    let registry = Registry::new(&doc);

    let code = match run(&registry, cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            2
        }
    };
    process::exit(code);
}

fn run(registry: &Registry, command: Commands) -> Result<i32, XrefError> {
    match command {
        Commands::Describe { symbol } => describe(registry, &symbol),
        Commands::Lookup { symbol, json } => match registry.locate(&symbol)? {
            Some(found) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&found).unwrap());
                } else {
                    match found {
                        Symbol::Function(f) => println!("command {}", f.signature()),
                        Symbol::Constant(c) => {
                            print!("enum {} = 0x{:04X}", c.name, c.value);
                            let groups = c.groups();
                            if groups.is_empty() {
                                println!();
                            } else {
                                println!("  [{}]", groups.join(", "));
                            }
                        }
                    }
                }
                Ok(0)
            }
            None => not_found(&symbol),
        },
        Commands::Aliases { symbol, json } => {
            if let Some(resolved) = registry.resolve_function_aliases(&symbol)? {
                if json {
                    println!("{}", serde_json::to_string_pretty(&resolved).unwrap());
                } else if resolved.aliases.is_empty() {
                    println!("{} has no aliases", resolved.canonical.name);
                } else {
                    for alias in &resolved.aliases {
                        println!("{alias}");
                    }
                }
                return Ok(0);
            }
            if let Some(resolved) = registry.resolve_constant_aliases(&symbol)? {
                if json {
                    println!("{}", serde_json::to_string_pretty(&resolved).unwrap());
                } else if resolved.aliases.is_empty() {
                    println!("{} has no aliases", resolved.entry.name);
                } else {
                    for alias in &resolved.aliases {
                        println!("{alias}");
                    }
                }
                return Ok(0);
            }
            not_found(&symbol)
        }
        Commands::Origin { symbol, json } => {
            if registry.locate(&symbol)?.is_none() {
                return not_found(&symbol);
            }
            let origins = registry.find_origin(&symbol)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&origins).unwrap());
            } else if origins.is_empty() {
                println!("{symbol} is not referenced by any feature set");
            } else {
                for origin in &origins {
                    println!(
                        "{:<15}{:>24}    ({} {})",
                        origin.action.label(),
                        origin.feature.name,
                        origin.feature.api,
                        origin.feature.number
                    );
                }
            }
            Ok(0)
        }
        Commands::Extension { symbol, json } => match registry.find_extension(&symbol)? {
            Some(ext) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&ext).unwrap());
                } else {
                    println!("{} ({})", ext.name, ext.supported);
                }
                Ok(0)
            }
            None => {
                if registry.locate(&symbol)?.is_some() {
                    println!("{symbol} is not provided by any extension");
                    Ok(0)
                } else {
                    not_found(&symbol)
                }
            }
        },
        Commands::Groups { of, matching, json } => {
            if let Some(symbol) = of {
                return match registry.groups_of(&symbol)? {
                    Some(groups) => {
                        if json {
                            println!("{}", serde_json::to_string_pretty(&groups).unwrap());
                        } else {
                            for group in &groups {
                                println!("{group}");
                            }
                        }
                        Ok(0)
                    }
                    None => not_found(&symbol),
                };
            }
            if let Some(fragment) = matching {
                let matches = registry.constants_in_group_matching(&fragment)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&matches).unwrap());
                } else {
                    for m in &matches {
                        let groups = m.constant.groups();
                        println!(
                            "{} = 0x{:04X}  [{}]",
                            m.constant.name,
                            m.constant.value,
                            groups.join(", ")
                        );
                        for origin in &m.origins {
                            println!(
                                "  * {:<15}{:>24}    ({} {})",
                                origin.action.label(),
                                origin.feature.name,
                                origin.feature.api,
                                origin.feature.number
                            );
                        }
                    }
                }
                return Ok(0);
            }
            let groups = registry.all_groups();
            if json {
                println!("{}", serde_json::to_string_pretty(&groups).unwrap());
            } else {
                for group in &groups {
                    println!("{group}");
                }
            }
            Ok(0)
        }
        Commands::Features { json } => {
            let features = registry.features()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&features).unwrap());
            } else {
                for feature in &features {
                    println!(
                        "Feature: [{:>5}]   {:>24}   ({})",
                        feature.api, feature.name, feature.number
                    );
                }
            }
            Ok(0)
        }
    }
}

/// Full report for one symbol: definition, providing extension, feature
/// history, and aliases.
fn describe(registry: &Registry, symbol: &str) -> Result<i32, XrefError> {
    let Some(found) = registry.locate(symbol)? else {
        return not_found(symbol);
    };

    println!("--------------------------------");
    match found {
        Symbol::Function(function) => {
            println!(" >> Command:  {}", function.signature());
            println!();

            print_extension(registry, &function.name)?;
            print_origins(registry, &function.name)?;

            if let Some(resolved) = registry.resolve_function_aliases(symbol)? {
                if !resolved.aliases.is_empty() {
                    println!();
                    for alias in &resolved.aliases {
                        print!(" >> Command Alias: {alias}");
                        match registry.find_extension(alias)? {
                            Some(ext) => println!("\tProvided by {} ({})", ext.name, ext.supported),
                            None => println!(),
                        }
                    }
                }
            }
        }
        Symbol::Constant(constant) => {
            println!(" >> Enum:   {} is 0x{:04X}", constant.name, constant.value);
            println!();

            print_extension(registry, &constant.name)?;
            print_origins(registry, &constant.name)?;

            let groups = constant.groups();
            if !groups.is_empty() {
                println!();
                println!("  * Groups: {}", groups.join(", "));
            }

            if let Some(resolved) = registry.resolve_constant_aliases(symbol)? {
                if !resolved.aliases.is_empty() {
                    println!();
                    for alias in &resolved.aliases {
                        print!(" >> Enum Alias: {alias}");
                        match registry.find_extension(alias)? {
                            Some(ext) => println!("\tProvided by {} ({})", ext.name, ext.supported),
                            None => println!(),
                        }
                    }
                }
            }
        }
    }

    Ok(0)
}

fn print_extension(registry: &Registry, name: &str) -> Result<(), XrefError> {
    if let Some(ext) = registry.find_extension(name)? {
        println!("  * Provided by {} ({})", ext.name, ext.supported);
        println!();
    }
    Ok(())
}

fn print_origins(registry: &Registry, name: &str) -> Result<(), XrefError> {
    for origin in registry.find_origin(name)? {
        println!(
            "  * {:<15}{:>24}    ({} {})",
            origin.action.label(),
            origin.feature.name,
            origin.feature.api,
            origin.feature.number
        );
    }
    Ok(())
}

fn not_found(symbol: &str) -> Result<i32, XrefError> {
    eprintln!("'{symbol}' not found in registry");
    Ok(1)
}
