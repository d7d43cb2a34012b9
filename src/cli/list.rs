use serde::Serialize;
use strum::IntoEnumIterator;
use table::{IntoTable, Table};
use tracing::debug;
pub(crate) mod table;

use crate::{
    assistant::{ResponseEngine, SUGGESTED_PROMPTS},
    config::Config,
    die,
    listings::{format_price, Car, Category, Filter, FirebaseListings, ListingSource},
    ListArgs, ListCarArgs, ListObject, ListingFormat,
};

impl From<Vec<Car>> for Table {
    fn from(value: Vec<Car>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["ID", "BRAND", "MODEL", "YEAR", "TYPE", "PRICE"]);
        tab.align_right(3);
        tab.align_right(5);

        for car in value {
            tab.add_row(vec![
                car.id,
                car.brand,
                car.model,
                car.year.to_string(),
                car.kind,
                format_price(car.price),
            ]);
        }

        tab
    }
}

impl From<Vec<Category>> for Table {
    fn from(value: Vec<Category>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["CATEGORY"]);

        for category in value {
            tab.add_row(vec![category.to_string()]);
        }

        tab
    }
}

#[derive(Serialize)]
pub(crate) struct NumberedContact {
    pub number: usize,
    pub name: String,
    pub phone: String,
}

impl From<Vec<NumberedContact>> for Table {
    fn from(value: Vec<NumberedContact>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["NO", "NAME", "PHONE"]);
        tab.align_right(0);

        for contact in value {
            tab.add_row(vec![contact.number.to_string(), contact.name, contact.phone]);
        }

        tab
    }
}

#[derive(Serialize)]
struct SuggestedPrompt {
    number: usize,
    prompt: &'static str,
}

impl From<Vec<SuggestedPrompt>> for Table {
    fn from(value: Vec<SuggestedPrompt>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["NO", "PROMPT"]);
        tab.align_right(0);

        for prompt in value {
            tab.add_row(vec![prompt.number.to_string(), prompt.prompt.to_string()]);
        }

        tab
    }
}

#[derive(Serialize)]
struct TopicKeywords {
    topic: String,
    keywords: String,
}

impl From<Vec<TopicKeywords>> for Table {
    fn from(value: Vec<TopicKeywords>) -> Self {
        let mut tab = Table::new();

        tab.set_header(vec!["TOPIC", "KEYWORDS"]);

        for topic in value {
            tab.add_row(vec![topic.topic, topic.keywords]);
        }

        tab
    }
}

pub(crate) fn numbered_contacts(config: &Config) -> Vec<NumberedContact> {
    config
        .contacts
        .iter()
        .enumerate()
        .map(|(i, contact)| NumberedContact {
            number: i + 1,
            name: contact.name.clone(),
            phone: contact.phone.clone(),
        })
        .collect()
}

fn suggested_prompts() -> Vec<SuggestedPrompt> {
    SUGGESTED_PROMPTS
        .iter()
        .enumerate()
        .map(|(i, &prompt)| SuggestedPrompt {
            number: i + 1,
            prompt,
        })
        .collect()
}

fn topics(engine: &ResponseEngine) -> Vec<TopicKeywords> {
    engine
        .rules()
        .iter()
        .map(|rule| TopicKeywords {
            topic: rule.topic.to_string(),
            keywords: rule.predicate.to_string(),
        })
        .collect()
}

/// Connects to the listings store named by the configuration, or exits.
pub(crate) fn listing_source(config: &Config) -> FirebaseListings {
    let api_base = config.api_base();

    match FirebaseListings::with_api_base(api_base.as_str()) {
        Ok(listings) => {
            debug!(api_base = %listings.api_base(), "using listings store");
            listings
        }
        Err(err) => die!("{}", err),
    }
}

async fn get_cars(source: &impl ListingSource, args: &ListCarArgs) -> Vec<Car> {
    let cars = match source.fetch_all().await {
        Ok(cars) => cars,
        Err(err) => die!("failed to fetch cars: {}", err),
    };

    let filter = Filter {
        search: args.search.clone().unwrap_or_default(),
        category: args.category.unwrap_or_default(),
    };

    filter.apply(cars)
}

pub(crate) fn format_output<O: IntoTable + Serialize>(object: O, format: ListingFormat) {
    match format {
        ListingFormat::Json => {
            let output = match serde_json::to_string_pretty(&object) {
                Ok(output) => output,
                Err(err) => die!("failed to serialize the listing: {}", err),
            };

            println!("{}", output);
        }
        ListingFormat::Table => {
            let tab = object.into_table();

            print!("{}", tab);
        }
        ListingFormat::HeaderlessTable => {
            let mut tab = object.into_table();

            tab.print_header(false);

            print!("{}", tab);
        }
    }
}

pub(crate) async fn list_cmd(config: &Config, args: &ListArgs) {
    let format = args.format;

    match &args.object {
        ListObject::Cars(car_args) => {
            let source = listing_source(config);
            let cars = get_cars(&source, car_args).await;
            format_output(cars, format);
        }
        ListObject::Categories => {
            let categories: Vec<Category> = Category::iter().collect();
            format_output(categories, format);
        }
        ListObject::Contacts => {
            format_output(numbered_contacts(config), format);
        }
        ListObject::Prompts => {
            format_output(suggested_prompts(), format);
        }
        ListObject::Topics => {
            format_output(topics(&ResponseEngine::default()), format);
        }
    }
}
