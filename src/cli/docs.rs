//! Documentation content for evq CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Fields,
    Conditions,
    Reduce,
    Store,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "fields" | "field" => Some(Self::Fields),
            "conditions" | "condition" | "where" => Some(Self::Conditions),
            "reduce" | "aggregation" | "aggregations" => Some(Self::Reduce),
            "store" | "write" | "files" => Some(Self::Store),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"EVQ DOCUMENTATION

evq runs MAP/REDUCE queries over newline-delimited JSON events stored in
hour-bucketed files. MAP projects and filters every event; the optional REDUCE
groups the surviving rows by a key and aggregates them.

DOCUMENTATION CATEGORIES

  syntax            Query shape, keywords and tokens
  fields            Properties, plucking, products and aggregations
  conditions        WHERE clauses and how mixed types compare
  reduce            Grouping and aggregation
  store             Hour files, writing events and time windows

QUICK REFERENCE

  MAP a, b                        Project fields a and b
  MAP a WHERE b > 1 AND c = "x"   Filter with conditions
  sku IN items                    Pluck sku from every record in items
  price * quantity                Multiply two fields
  SUM(amount)  COUNT(amount)      Aggregate a list
  REDUCE SUM amount ON user_id    Group by user_id and total amount

Run 'evq doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Fields) => Ok(FIELDS_DOC),
        Some(DocCategory::Conditions) => Ok(CONDITIONS_DOC),
        Some(DocCategory::Reduce) => Ok(REDUCE_DOC),
        Some(DocCategory::Store) => Ok(STORE_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Query Shape

  MAP <field>[, <field>]* [WHERE <cond> [AND <cond>]*]
  [REDUCE <field>[, <field>]* [WHERE <cond> [AND <cond>]*] ON <key>]

KEYWORDS
  MAP REDUCE ON WHERE AND IN SUM COUNT
    Case-insensitive.

TOKENS
  amount, user_id       Property names (letters, digits, underscores)
  42, 3.5, -1           Numbers
  "purchase"            Strings (double quotes, may contain spaces)
  = != > >= < <= *      Operators; separate them from operands with spaces

    Constraints:
      - amount>0 is a single (illegal) token; write amount > 0
"#;

const FIELDS_DOC: &str = r#"FIELDS - What a Query Outputs

PROPERTY
  amount
    The value of "amount" in the event. Missing keys and nulls are absent.
    Nested objects and booleans are not supported values and are absent.

PLUCK
  sku IN items
    "items" must be a list. Produces the "sku" of every record in it;
    elements without a "sku" are skipped. Output column: sku.

    Example:
      Input:  {"items": [{"sku": "a"}, {"sku": "b"}, {"qty": 1}]}
      Query:  MAP sku IN items
      Output: [{"sku": ["a", "b"]}]

PRODUCT
  price * quantity
    Multiplies two numbers. Non-numeric operands count as 0.
    Output column: price*quantity.

AGGREGATION
  SUM amount, SUM(amount), COUNT(amount)
    Reduces a list to one value. SUM skips non-numeric elements and stays an
    integer when every element is one. Aggregating a non-list yields nothing.
    Output column: the target's name (amount).
"#;

const CONDITIONS_DOC: &str = r#"CONDITIONS - Filtering

  WHERE amount > 0 AND kind = "purchase"
    All conditions must hold. Operands are numbers, strings or properties.

MIXED TYPES
  int vs float        Compared as floats
  number vs string    The string is parsed as the number's type;
                      when it does not parse, the condition is false
  missing property    Takes the zero value of the other side (0, 0.0, "")
  lists               Cannot be compared; the query fails
"#;

const REDUCE_DOC: &str = r#"REDUCE - Grouping

  MAP user_id, amount REDUCE SUM amount ON user_id

  1. Every kept row is grouped by the value of its "user_id" field.
     Rows whose key is not a string are dropped.
  2. Every other field collects a list of its values per group.
  3. REDUCE fields are evaluated per group and replace those lists.
  4. REDUCE conditions see the collected lists; failing groups are dropped.

    Output:
      {"a": {"amount": 12}, "b": {"amount": 3}}
"#;

const STORE_DOC: &str = r#"STORE - Hour Files

  Events live in one file per UTC hour, named YYYY-MM-DDThh, one JSON object
  per line, under --data-dir (default: data, env EVQ_DATA_DIR).

WRITING
  evq write '{"_ts": 1709820000, "user_id": "a", "amount": 5}'
  evq write '[{"_ts": 1709820000}, {"_ts": 1709823600}]'
    Every event needs an integer "_ts" (unix seconds).

QUERYING A WINDOW
  evq query 'MAP user_id' --start 1709820000 --end 1709823600
    Scans every hour file from the hour of --start to the hour of --end.

QUERYING OTHER INPUT
  cat events.jsonl | evq query 'MAP user_id'
  evq query 'MAP user_id' --input events.jsonl
"#;
