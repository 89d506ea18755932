// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Functions related to order book display.

use tabled::{Table, Tabled, settings::Style};

use super::{book::Book, level::PriceLevel};

#[derive(Tabled)]
struct BookLevelDisplay {
    bid_entries: String,
    bid_size: String,
    bid_price: String,
    ask_price: String,
    ask_size: String,
    ask_entries: String,
}

/// Returns a table of the top `num_levels` of the book, bids and asks side
/// by side, with any market-order levels on a leading row.
#[must_use]
pub fn pprint_book(book: &Book, num_levels: usize) -> String {
    let bids: Vec<&PriceLevel> = book.bid_iter().take(num_levels).collect();
    let asks: Vec<&PriceLevel> = book.ask_iter().take(num_levels).collect();

    let mut rows = Vec::new();

    if book.bid_market_orders().is_some() || book.ask_market_orders().is_some() {
        rows.push(market_row(book.bid_market_orders(), book.ask_market_orders()));
    }

    for i in 0..bids.len().max(asks.len()) {
        let bid = bids.get(i).copied();
        let ask = asks.get(i).copied();
        rows.push(BookLevelDisplay {
            bid_entries: bid.map_or_else(String::new, |l| l.num_entries.to_string()),
            bid_size: bid.map_or_else(String::new, |l| l.size.to_string()),
            bid_price: bid.map_or_else(String::new, |l| l.price.to_string()),
            ask_price: ask.map_or_else(String::new, |l| l.price.to_string()),
            ask_size: ask.map_or_else(String::new, |l| l.size.to_string()),
            ask_entries: ask.map_or_else(String::new, |l| l.num_entries.to_string()),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{book}\n{table}")
}

fn market_row(bid: Option<&PriceLevel>, ask: Option<&PriceLevel>) -> BookLevelDisplay {
    BookLevelDisplay {
        bid_entries: bid.map_or_else(String::new, |l| l.num_entries.to_string()),
        bid_size: bid.map_or_else(String::new, |l| l.size.to_string()),
        bid_price: bid.map(|_| "MARKET".to_string()).unwrap_or_default(),
        ask_price: ask.map(|_| "MARKET".to_string()).unwrap_or_default(),
        ask_size: ask.map_or_else(String::new, |l| l.size.to_string()),
        ask_entries: ask.map_or_else(String::new, |l| l.num_entries.to_string()),
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::orderbook::stubs::stub_book;

    #[rstest]
    fn test_pprint_book(stub_book: Book) {
        let rendered = stub_book.pprint(10);

        assert!(rendered.contains("AAPL.XNGS"));
        assert!(rendered.contains("bid_price"));
        assert!(rendered.contains("100.00"));
        assert!(rendered.contains("101.00"));
    }

    #[rstest]
    fn test_pprint_respects_depth(stub_book: Book) {
        let rendered = stub_book.pprint(1);
        // Second-best bid not shown at depth 1
        assert!(!rendered.contains("99.00"));
    }
}
