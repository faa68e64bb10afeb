/*!

This is the long-form manual for `name_tally` and `nametab`.

## Input format

The inputs are tab-delimited voter demographic extracts. The first line of
each file is a header. It is skipped and never checked. Every other line is
one voter, a blank line included: it has no field and stops the run like any
other short line. Only three fields are read, at fixed positions:

* the name: first, middle or last name depending on the mode
* the gender code
* the ethnicity code

The default positions are the ones of the L2 VM2 `DEMOGRAPHIC.tab` files:

| field       | column (0-based) |
|-------------|------------------|
| first name  | 14               |
| middle name | 15               |
| last name   | 16               |
| gender      | 65               |
| ethnicity   | 74               |

A line that is too short for one of these positions stops the whole run.

## Output format

One CSV file per frequency table, with a header and one line per distinct
name, in the order the names were first seen:

```text
Name,No Race,Native American (self reported),East Asian,African or Af-Am Self Reported,Hispanic,White Self Reported,Other Undefined Race
MARIA,3,0,0,0,12,1,0
```

The file is called `nameRatios_full_<mode>.csv`. With gender segregation,
three files are written instead: `nameRatios_full_male_<mode>.csv`,
`nameRatios_full_female_<mode>.csv` and `nameRatios_full_unknown_<mode>.csv`.
Only the exact codes `M` and `F` count as male and female.

Ethnicity codes that are not in the list of columns are dropped from the
reports. `nametab` prints a warning with their totals. Use
`--unrecognized column` to keep them in an extra `Unrecognized` column.

## Configuration file

All the keys are optional.

```json
{
  "inputRoot": "/data/CronJob/",
  "inputPaths": [
    "2020october05/VM2--SC--2020-10-01-DEMOGRAPHIC.tab",
    "2021january26/VM2--LA--2021-01-22-DEMOGRAPHIC.tab"
  ],
  "outputDirectory": "reports",
  "columns": {
    "firstName": 14,
    "middleName": 15,
    "lastName": 16,
    "gender": 65,
    "ethnicity": 74
  },
  "ethnicities": [
    { "code": "", "label": "No Race" },
    { "code": "1", "label": "Native American (self reported)" },
    { "code": "2", "label": "East Asian" },
    { "code": "3", "label": "African or Af-Am Self Reported" },
    { "code": "4", "label": "Hispanic" },
    { "code": "5", "label": "White Self Reported" },
    { "code": "6", "label": "Other Undefined Race" }
  ],
  "unrecognizedEthnicity": "drop",
  "progressInterval": 500000
}
```

The list of ethnicities must have exactly 7 entries with distinct codes.

## Sampling

`votersample` reduces a tab-delimited statewide voter file to 14 columns and
a 5% random sample of its rows. Pass `--seed` to get the same sample twice.

*/
