use streamcheck_schema::{RegistryConfig, SchemaRegistry};

use crate::cmd::StreamsArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_streams, OutputFormat};

pub fn run(args: StreamsArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = SchemaRegistry::from_catalog_file(&args.catalog, RegistryConfig::default())
        .map_err(|err| schema_error(&format!("catalog {}", args.catalog.display()), err))?;

    print_streams(&registry.streams(), format);
    Ok(SUCCESS)
}
