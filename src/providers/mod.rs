pub mod yahoo_finance;
