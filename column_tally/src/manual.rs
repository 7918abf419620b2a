/*!

This is the long-form manual for `column_tally` and `coltally`.

## Analyses

The following analyses are supported:
* `registrations` counts the registrations sold in a products column
* `committees` counts the committees named in a survey column, weighted by registrations
* `similarity` finds duplicates and near-duplicates in any column

All of them read a CSV file (or an Excel workbook) with a header row.

### `registrations`

The products column is expected to hold one product per line, as exported by most
payment platforms:

```text
Conference Registration (Amount: 20.00 USD, Quantity: 2, Registration Type: Regular)
T-Shirt (Amount: 15.00 USD, Quantity: 1)
Total: 55.00 USD
Transaction ID: 8FJ2K
```

Only the products with `Registration` in their name are counted. The `Total:` and
`Transaction ID:` lines are ignored. The report gives the number of registrations by
`name - registration type` and by price point.

### `committees`

The committee column is free text. Each answer is split on `/`, `,`, `&` and ` and `,
and each piece is mapped to a committee name:
- anything ending in `YPAA` is a committee name (`wacypaa` becomes `WACYPAA`)
- known typos and nicknames are looked up in the alias table (`wacy` becomes `WACYPAA`)
- mentions of a host or advisory committee are counted together

Answers such as `no`, `maybe` or `not yet` are counted as not specified. Answers such
as `yes!` that do not name a committee are counted separately.

Each row counts as many times as the number of registrations bought in that row, which
is read from the products column (found automatically if its name contains `products`).

### `similarity`

Lists the most frequent values of the column, then groups the values that look alike
(typos, variations in case or spelling). Two values are grouped when their similarity
ratio is above the cutoff (`--cutoff`, between 0 and 1, 0.8 by default). The ratio is
the Ratcliff/Obershelp ratio: twice the number of matching characters divided by the
total number of characters.

## Input

CSV files are decoded as UTF-8 (with or without a byte order mark), then as Windows-1252,
then as Latin-1. Excel workbooks (`.xlsx`) are read from the first worksheet, unless
`--excel-worksheet-name` is provided.

When the file or the column is not given on the command line, `coltally` asks for it.
Columns can be chosen by name or by number (starting at 1).

## Configuration

`coltally` comes with sensible defaults. They can be changed with a configuration file
in JSON passed with `--config`:

```json
{
  "encodings": ["utf-8-sig", "cp1252"],
  "threshold": 3,
  "committee": {
    "aliases": [{ "alias": "PACY", "canonical": "PACYPAA" }],
    "noResponses": ["not applicable"],
    "yesResponses": ["yup"],
    "replaceDefaults": false
  },
  "similarity": { "cutoff": 0.85, "top": 20 }
}
```

All the fields are optional. The aliases are added after the built-in table and the
answers to the built-in lists, unless `replaceDefaults` is set. The encodings are tried
in order, among `utf-8-sig`, `utf-8`, `cp1252` and `latin-1`. Options given on the command line take precedence.

## Output

The report is printed on the standard output. With `--out`, a summary is also written
in JSON. With `--reference`, the summary is compared to a previous summary and the
program fails if they differ.

 */
