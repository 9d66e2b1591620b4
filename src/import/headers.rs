//! Header normalization for imported spreadsheets
//!
//! Logbook exports arrive with wildly inconsistent column names (English,
//! French, units in parentheses, stray case and accents). Headers are folded
//! to a canonical form and matched against a fixed synonym table.

/// Fold a header or enum cell for matching: lowercase, diacritics stripped,
/// parenthesized unit suffixes dropped, underscores and runs of whitespace
/// collapsed to single spaces.
pub(crate) fn fold(raw: &str) -> String {
    let stem = raw.split('(').next().unwrap_or(raw);
    let mut out = String::with_capacity(stem.len());
    let mut last_space = true;
    for c in stem.chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'à' | 'â' | 'ä' | 'á' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' => 'i',
            'ô' | 'ö' | 'ó' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ç' => 'c',
            '_' | '-' => ' ',
            c => c,
        };
        if mapped.is_whitespace() {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(mapped);
            last_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChargeColumn {
    Date,
    Odometer,
    StartPercent,
    EndPercent,
    Tariff,
    CustomPrice,
    PriceSnapshot,
    Status,
}

pub(crate) fn match_charge_column(folded: &str) -> Option<ChargeColumn> {
    let col = match folded {
        "date" | "jour" => ChargeColumn::Date,
        "odometer" | "odo" | "km" | "kilometrage" | "mileage" | "compteur" => {
            ChargeColumn::Odometer
        }
        "start percent" | "start %" | "% start" | "battery start" | "start battery"
        | "batterie debut" | "% debut" => ChargeColumn::StartPercent,
        "end percent" | "end %" | "% end" | "battery end" | "end battery" | "batterie fin"
        | "% fin" => ChargeColumn::EndPercent,
        "tariff" | "tarif" | "rate" => ChargeColumn::Tariff,
        "custom price" | "session price" | "prix session" => ChargeColumn::CustomPrice,
        "price per kwh" | "kwh price" | "unit price" | "prix kwh" | "prix unitaire" => {
            ChargeColumn::PriceSnapshot
        }
        "status" | "etat" | "state" => ChargeColumn::Status,
        _ => return None,
    };
    Some(col)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TripColumn {
    Date,
    StartOdometer,
    EndOdometer,
    StartPercent,
    EndPercent,
    Destination,
    Client,
    Billed,
    Status,
}

pub(crate) fn match_trip_column(folded: &str) -> Option<TripColumn> {
    let col = match folded {
        "date" | "jour" => TripColumn::Date,
        "start odometer" | "odometer start" | "start km" | "km depart" | "compteur depart" => {
            TripColumn::StartOdometer
        }
        "end odometer" | "odometer end" | "end km" | "km arrivee" | "compteur arrivee" => {
            TripColumn::EndOdometer
        }
        "start percent" | "start %" | "% start" | "battery start" | "batterie depart"
        | "% depart" => TripColumn::StartPercent,
        "end percent" | "end %" | "% end" | "battery end" | "batterie arrivee" | "% arrivee" => {
            TripColumn::EndPercent
        }
        "destination" | "lieu" | "place" => TripColumn::Destination,
        "client" | "customer" | "company" | "societe" => TripColumn::Client,
        "billed" | "billable" | "invoiced" | "facture" | "facturable" => TripColumn::Billed,
        "status" | "etat" | "state" => TripColumn::Status,
        _ => return None,
    };
    Some(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_lowercases_and_strips_accents() {
        assert_eq!(fold("Kilométrage"), "kilometrage");
        assert_eq!(fold("BATTERIE DÉBUT"), "batterie debut");
    }

    #[test]
    fn fold_drops_units_and_collapses_separators() {
        assert_eq!(fold("Odometer (km)"), "odometer");
        assert_eq!(fold("start_percent"), "start percent");
        assert_eq!(fold("  End   %  "), "end %");
    }

    #[test]
    fn charge_columns_match_synonyms() {
        assert_eq!(match_charge_column(&fold("Date")), Some(ChargeColumn::Date));
        assert_eq!(
            match_charge_column(&fold("Kilométrage (km)")),
            Some(ChargeColumn::Odometer)
        );
        assert_eq!(
            match_charge_column(&fold("Batterie début")),
            Some(ChargeColumn::StartPercent)
        );
        assert_eq!(match_charge_column(&fold("Tarif")), Some(ChargeColumn::Tariff));
        assert_eq!(match_charge_column(&fold("Notes")), None);
    }

    #[test]
    fn trip_columns_match_synonyms() {
        assert_eq!(
            match_trip_column(&fold("Km départ")),
            Some(TripColumn::StartOdometer)
        );
        assert_eq!(
            match_trip_column(&fold("Km arrivée")),
            Some(TripColumn::EndOdometer)
        );
        assert_eq!(match_trip_column(&fold("Facturé")), Some(TripColumn::Billed));
        assert_eq!(match_trip_column(&fold("Société")), Some(TripColumn::Client));
        assert_eq!(match_trip_column(&fold("Notes")), None);
    }
}
