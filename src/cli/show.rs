use serde::Serialize;

use super::list::{format_output, listing_source, table::Table};
use crate::config::Config;
use crate::listings::{format_price, Car, ListingSource};
use crate::{die, ShowArgs};

/// A single car, printed as one `FIELD VALUE` row per attribute.
#[derive(Serialize)]
#[serde(transparent)]
struct CarDetails(Car);

impl From<CarDetails> for Table {
    fn from(value: CarDetails) -> Self {
        let car = value.0;

        let mut tab = Table::new();

        tab.set_header(vec!["FIELD", "VALUE"]);

        let fields = [
            ("id", car.id),
            ("brand", car.brand),
            ("model", car.model),
            ("year", car.year.to_string()),
            ("type", car.kind),
            ("price", format_price(car.price)),
            ("transmission", car.transmission),
            ("fuel", car.fuel_type),
            ("seats", car.seating_capacity.to_string()),
            ("image", car.image),
        ];

        for (field, value) in fields {
            tab.add_row(vec![field.to_string(), value]);
        }

        tab
    }
}

pub(crate) async fn show_cmd(config: &Config, args: &ShowArgs) {
    let source = listing_source(config);

    let car = match source.fetch_one(&args.id).await {
        Ok(Some(car)) => car,
        Ok(None) => die!("no car with id \"{}\", try `list cars`", args.id),
        Err(err) => die!("failed to fetch car \"{}\": {}", args.id, err),
    };

    format_output(CarDetails(car), args.format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::FirebaseListings;

    const DOCUMENT: &str = r#"{
        "-Nx1": {
            "brand": "Honda",
            "model": "Civic",
            "year": 2021,
            "price": 27999.6,
            "transmission": "CVT",
            "fuelType": "Petrol",
            "seatingCapacity": 5,
            "image": "https://example.com/civic.png",
            "type": "Sedan"
        }
    }"#;

    fn civic() -> Car {
        FirebaseListings::decode(DOCUMENT).unwrap().remove(0)
    }

    #[test]
    fn test_details_table() {
        let tab: Table = CarDetails(civic()).into();

        assert_eq!(
            tab.to_string(),
            "FIELD         VALUE\n\
             id            -Nx1\n\
             brand         Honda\n\
             model         Civic\n\
             year          2021\n\
             type          Sedan\n\
             price         $ 28,000\n\
             transmission  CVT\n\
             fuel          Petrol\n\
             seats         5\n\
             image         https://example.com/civic.png\n"
        );
    }

    #[test]
    fn test_details_json_is_the_record() {
        let value = serde_json::to_value(CarDetails(civic())).unwrap();

        assert_eq!(value["id"], "-Nx1");
        assert_eq!(value["fuelType"], "Petrol");
        assert_eq!(value["price"], 27999.6);
    }
}
