use anyhow::Context;
use std::path::PathBuf;

#[derive(argh::FromArgs)]
#[argh(description = "A tool to query the wallhaven.cc api")]
struct Options {
    #[argh(option, description = "the api key to authenticate with")]
    api_key: Option<String>,

    #[argh(
        option,
        short = 'o',
        description = "write the response to this file instead of printing it"
    )]
    output: Option<PathBuf>,

    #[argh(switch, description = "skip tls certificate verification")]
    accept_invalid_certs: bool,

    #[argh(subcommand)]
    subcommand: Subcommand,
}

#[derive(argh::FromArgs)]
#[argh(subcommand)]
enum Subcommand {
    Search(SearchOptions),
    Wallpaper(WallpaperOptions),
    Tag(TagOptions),
    Collections(CollectionsOptions),
}

#[derive(argh::FromArgs)]
#[argh(subcommand, name = "search", description = "search for wallpapers")]
struct SearchOptions {
    #[argh(option, description = "category filter code, like 111")]
    categories: Option<String>,

    #[argh(option, description = "purity filter code, like 100")]
    purity: Option<String>,

    #[argh(option, description = "sorting criteria, like relevance or random")]
    sorting: Option<String>,

    #[argh(option, description = "sort order, desc or asc")]
    order: Option<String>,

    #[argh(option, description = "time range for the toplist, like 1d or 1w")]
    top_range: Option<String>,

    #[argh(option, description = "minimum resolution, like 1920x1080")]
    minimum_resolution: Option<String>,

    #[argh(option, description = "an exact resolution, may be given multiple times")]
    resolution: Vec<String>,

    #[argh(option, description = "an aspect ratio, may be given multiple times")]
    ratio: Vec<String>,

    #[argh(option, description = "color filter")]
    colors: Option<String>,

    #[argh(option, description = "page number")]
    page: Option<u64>,

    #[argh(option, description = "seed for random sorting")]
    seed: Option<String>,
}

#[derive(argh::FromArgs)]
#[argh(subcommand, name = "wallpaper", description = "get a wallpaper by id")]
struct WallpaperOptions {
    #[argh(positional, description = "the wallpaper id")]
    id: String,
}

#[derive(argh::FromArgs)]
#[argh(subcommand, name = "tag", description = "get a tag by id")]
struct TagOptions {
    #[argh(positional, description = "the tag id")]
    id: String,
}

#[derive(argh::FromArgs)]
#[argh(
    subcommand,
    name = "collections",
    description = "get a user's collections, or the wallpapers in one of them"
)]
struct CollectionsOptions {
    #[argh(positional, description = "the username")]
    username: String,

    #[argh(option, description = "the collection id to list wallpapers from")]
    collection: Option<String>,

    #[argh(option, description = "page number")]
    page: Option<u64>,
}

fn main() {
    let options: Options = argh::from_env();
    let code = match real_main(options) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e:?}");
            1
        }
    };

    std::process::exit(code);
}

fn real_main(options: Options) -> anyhow::Result<()> {
    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    tokio_rt.block_on(async_main(options))
}

async fn async_main(options: Options) -> anyhow::Result<()> {
    let mut client_builder =
        wallhaven::Client::builder().accept_invalid_certs(options.accept_invalid_certs);
    if let Some(api_key) = options.api_key.as_deref() {
        client_builder = client_builder.api_key(api_key);
    }
    let client = client_builder.build();

    let response = match &options.subcommand {
        Subcommand::Search(search_options) => {
            let query = wallhaven::SearchQuery {
                categories: search_options.categories.clone(),
                purity: search_options.purity.clone(),
                sorting: search_options.sorting.clone(),
                order: search_options.order.clone(),
                top_range: search_options.top_range.clone(),
                minimum_resolution: search_options.minimum_resolution.clone(),
                resolutions: search_options.resolution.clone(),
                ratios: search_options.ratio.clone(),
                colors: search_options.colors.clone(),
                page: search_options.page,
                seed: search_options.seed.clone(),
            };
            client.search(&query).await.context("failed to search")?
        }
        Subcommand::Wallpaper(wallpaper_options) => client
            .get_wallpaper(&wallpaper_options.id)
            .await
            .context("failed to get wallpaper")?,
        Subcommand::Tag(tag_options) => client
            .get_tag(&tag_options.id)
            .await
            .context("failed to get tag")?,
        Subcommand::Collections(collections_options) => {
            match collections_options.collection.as_deref() {
                Some(collection_id) => client
                    .get_collection_wallpapers(
                        &collections_options.username,
                        collection_id,
                        collections_options.page,
                    )
                    .await
                    .context("failed to get collection wallpapers")?,
                None => client
                    .get_collections(&collections_options.username)
                    .await
                    .context("failed to get collections")?,
            }
        }
    };

    match options.output.as_deref() {
        Some(path) => {
            wallhaven::save_as_json(&response, path).context("failed to save response")?;
            println!("Saved to: {}", path.display());
        }
        None => {
            let text =
                serde_json::to_string_pretty(&response).context("failed to format response")?;
            println!("{text}");
        }
    }

    Ok(())
}
