/*!

This is the long-form manual for `pay_calc` and `paysheet`.

## Input

The input is the spreadsheet export of the monthly instructor report form
(Excel `.xlsx`). The first row holds the questions of the form, every other
row is one report. All the cells are read as text.

The following headers are renamed:

| Form header                                              | Column                      |
|----------------------------------------------------------|-----------------------------|
| `Timestamp`                                              | `Date`                      |
| `Email Address`                                          | `Email`                     |
| `How many work meetings did you attend this month?`      | `Work Meetings`             |
| `How many admin meetings did you attend this month?`     | `Admin Meetings`            |
| `What is the total amount you are requesting this month?`| `Instructor Provided Total` |
| `How many classes did you teach this month? [Arroyo]`    | `Arroyo` (one per venue)    |

The side projects and invoices questions become `Side Projects` and
`Invoices/Receipts`. Any other column is kept as it is.

## Calculation

```text
Total # of Classes      = sum of all the venue counts
Calculated Total Amount = Work Meetings * 20 + Admin Meetings * 25
                        + (Total # of Classes - Orchard Hills) * Rate
                        + Orchard Hills * OH Rate
                        + Side Projects + Invoices/Receipts
```

`Rate` and `OH Rate` come from the rate configuration, looked up by the
title-cased full name. An instructor missing from the configuration keeps the
rate written in the upload, if any, or zero. The meeting rates can be changed
in the configuration as well.

The free text cells (`Instructor Provided Total`, `Side Projects`,
`Invoices/Receipts`) are read by adding every number they contain:
`$50 plus $25.50 tip` is `75.50`. Note that `$1,200` reads as `1 + 200`.

Counts that are not numbers, or are negative, read as zero. Counts above
1,000,000 are read as 1,000,000.

## Filters

- `month` keeps the reports of one calendar month, of any year unless a year is
  also given.
- `email` and `name` keep the reports whose email or full name contain the
  given text, ignoring case.

The filters are applied in this order: month, email, name.

## Configuration

```json
{
  "baseRates": { "John Smith": 50, "Ann Lee": 40 },
  "ohRates": { "Ann Lee": 60 },
  "workMeetingRate": 20,
  "adminMeetingRate": 25,
  "highlightThreshold": 4
}
```

All the keys are optional.

## Outputs

- `--xlsx` a spreadsheet with sized columns, a filter on every column, dollar
  amounts, and the meeting and class counts above the highlight threshold
  shown in color.
- `--html` a striped HTML table.
- `--out` the table as JSON, in display form. `stdout` prints it.

*/
